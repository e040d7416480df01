pub mod channels;
pub mod embed;
