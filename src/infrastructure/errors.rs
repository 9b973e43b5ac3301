use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeadsheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("could not write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("workbook has no sheets")]
    NoSheets,

    #[error("sheet has no header row")]
    MissingHeader,

    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),

    #[error("logger already installed")]
    Logger(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, LeadsheetError>;
