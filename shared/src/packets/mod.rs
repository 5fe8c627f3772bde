pub mod error;
pub mod packet_header;
pub mod packet_processor;
pub mod packet_processors;
