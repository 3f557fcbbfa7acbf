mod login;
mod types;
