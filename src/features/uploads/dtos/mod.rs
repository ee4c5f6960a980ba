mod upload_dto;

pub use upload_dto::{ConfirmUploadRequest, ReserveUploadRequest, UploadTicket};
