pub mod habit;
pub mod tracking;
pub mod user;
pub mod verification_token;

pub use habit::{Entity as Habit, Model as HabitModel};
pub use tracking::{Entity as Tracking, Model as TrackingModel};
pub use user::{Entity as User, Model as UserModel};
pub use verification_token::{Entity as VerificationToken, Model as VerificationTokenModel};
