//! Types shared between the chess client and the relay server

pub mod protocol;
