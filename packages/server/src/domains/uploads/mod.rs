//! Uploads domain - multipart receive and the on-disk file sink

pub mod form;
pub mod store;

pub use form::{
    receive_multipart, Accept, FileRule, MultipartForm, StoredFiles, UploadError, UploadedFile, MIB,
};
pub use store::UploadStore;

/// Profile photo on verify-otp: one image up to 5 MiB.
pub const PROFILE_PHOTO_RULES: &[FileRule] =
    &[FileRule::new("profilePhoto", 1, 5 * MIB, Accept::Images)];

/// Sell-enquiry attachments; each file up to 10 MiB.
pub const SELL_ENQUIRY_RULES: &[FileRule] = &[
    FileRule::new("images", 5, 10 * MIB, Accept::Images),
    FileRule::new("document", 1, 10 * MIB, Accept::ImagesOrPdf),
    FileRule::new("verificationDocs", 3, 10 * MIB, Accept::ImagesOrPdf),
];
