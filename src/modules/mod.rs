pub mod gif2header;
