mod file_dto;

pub use file_dto::{
    DeleteFileResponseDto, FileFilter, FileQueryParams, FileResponseDto, RenameFileDto,
    StorageStatsDto, UploadFileDto,
};
