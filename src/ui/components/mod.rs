pub mod friends;
pub mod player_bar;
pub mod spinner;
