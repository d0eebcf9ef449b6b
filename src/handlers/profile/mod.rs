pub mod profile_photo;
