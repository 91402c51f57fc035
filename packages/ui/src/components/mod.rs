//! Small presentational building blocks shared by the views.

mod button;
pub use button::{Button, ButtonVariant};

mod card;
pub use card::{Card, CardContent, CardDescription, CardHeader, CardTitle};

mod input;
pub use input::{Input, Label};
