mod error;
mod logger;
mod view;
