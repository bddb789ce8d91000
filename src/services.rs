pub mod crm_service;
pub mod finance_service;
pub mod inventory_service;
pub mod operation_service;
pub mod supplier_service;
