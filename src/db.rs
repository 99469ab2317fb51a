pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod purchase_repo;
pub use purchase_repo::PurchaseRepository;
pub mod sale_repo;
pub use sale_repo::SaleRepository;
pub mod employee_repo;
pub use employee_repo::EmployeeRepository;

pub mod unit_of_work;
pub use unit_of_work::{finish, PgStore, SoftDeletable, Store, UnitOfWork};

#[cfg(test)]
pub mod memory_store;
#[cfg(test)]
pub use memory_store::MemoryStore;
