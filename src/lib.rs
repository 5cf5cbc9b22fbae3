//! Strip trailing advertisement pages from password-protected bill PDFs.
//!
//! A bill type picks a [`BillProfile`]: the password that unlocks the bill and
//! how many leading pages to keep. [`trim_bill`] writes the kept pages,
//! unencrypted, to `final_<bill_type>_<name>` beside the input.

pub mod error;
pub mod profile;
pub mod trim;

pub use error::TrimError;
pub use profile::{BillProfile, KNOWN_BILLS, Profiles};
pub use trim::{TrimReport, output_path, pages_to_delete, trim_bill};
