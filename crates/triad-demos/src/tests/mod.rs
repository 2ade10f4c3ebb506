mod mail;
mod stage;
