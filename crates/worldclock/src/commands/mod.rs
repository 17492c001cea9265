pub mod banner;
pub mod doctor;
pub mod init;
pub mod run;
pub mod sync;
pub mod zones;
