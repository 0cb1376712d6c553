use thiserror::Error;

#[derive(Error, Debug)]
pub enum HachToanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Spreadsheet write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("A document-number suffix is required (e.g. --suffix A)")]
    MissingSuffix,

    #[error("Unknown layout: {0}")]
    UnknownLayout(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, HachToanError>;
