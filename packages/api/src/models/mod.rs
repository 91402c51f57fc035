//! Data models for the application.

mod quiet_hour;
mod session;
mod user;

pub use quiet_hour::{CreateQuietHourInput, QuietHour, UpdateQuietHourInput, REMINDER_LEAD_MINUTES};
pub use session::{Session, SessionUser, UserMetadata};
pub use user::{NewProfile, Profile, User, UserSource};
