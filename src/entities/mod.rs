//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod cleaning_service;
pub mod sale;
pub mod scheduled_finalization;
pub mod tax_bracket;
pub mod user;
pub mod week;

// Re-export specific types to avoid conflicts
pub use cleaning_service::{
    Column as CleaningServiceColumn, Entity as CleaningService, Model as CleaningServiceModel,
};
pub use sale::{Column as SaleColumn, Entity as Sale, Model as SaleModel};
pub use scheduled_finalization::{
    Column as ScheduledFinalizationColumn, Entity as ScheduledFinalization,
    Model as ScheduledFinalizationModel,
};
pub use tax_bracket::{Column as TaxBracketColumn, Entity as TaxBracket, Model as TaxBracketModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
pub use week::{Column as WeekColumn, Entity as Week, Model as WeekModel};
