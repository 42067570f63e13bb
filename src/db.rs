pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod invoice_repo;
pub use invoice_repo::InvoiceRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
