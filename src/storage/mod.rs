pub mod csv;

pub use self::csv::CsvStorage;

pub const LISTING_HEADERS: &[&str] = &["Company", "Title", "Type", "Location", "URL"];

pub const FULL_HEADERS: &[&str] = &[
    "Company",
    "Title",
    "Type",
    "Location",
    "URL",
    "Job_Description",
    "Job_Requirements",
    "Job_Benefits",
];
