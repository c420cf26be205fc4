pub mod source_file;
