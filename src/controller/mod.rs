pub mod view;

pub use view::CertificateController;
