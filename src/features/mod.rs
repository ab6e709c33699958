pub mod antibot;
