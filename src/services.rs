pub mod invoice_service;
pub use invoice_service::InvoiceService;
pub mod payment_service;
pub use payment_service::PaymentService;
pub mod report_service;
pub use report_service::ReportService;
