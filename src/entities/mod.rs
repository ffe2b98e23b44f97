//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod booking;
pub mod message;
pub mod money;
pub mod payment;
pub mod property;
pub mod review;
pub mod role;
pub mod user;

// Re-export specific types to avoid conflicts
pub use booking::{
    BookingStatus, Column as BookingColumn, Entity as Booking, Model as BookingModel,
};
pub use message::{Column as MessageColumn, Entity as Message, Model as MessageModel};
pub use money::Money;
pub use payment::{Column as PaymentColumn, Entity as Payment, Model as PaymentModel};
pub use property::{Column as PropertyColumn, Entity as Property, Model as PropertyModel};
pub use review::{Column as ReviewColumn, Entity as Review, Model as ReviewModel};
pub use role::{Column as RoleColumn, Entity as Role, Model as RoleModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
