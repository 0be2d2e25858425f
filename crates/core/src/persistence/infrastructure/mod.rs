pub mod glyph_annotator;
pub mod jpeg_file_writer;
