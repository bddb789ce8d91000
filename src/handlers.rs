pub mod crm;
pub mod finance;
pub mod inventory;
pub mod operations;
pub mod suppliers;
