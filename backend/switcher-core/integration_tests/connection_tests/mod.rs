mod connection;
mod helpers;
mod session;
