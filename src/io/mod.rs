pub mod edge_list_reader;
pub mod edge_list_writer;
pub mod partition_export;
pub mod report;

pub use edge_list_reader::EdgeListReader;
pub use edge_list_writer::EdgeListWriter;
pub use partition_export::*;
pub use report::*;
