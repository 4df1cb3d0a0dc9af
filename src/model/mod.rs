pub mod form_state;
pub mod game_state;
pub mod presets;
pub mod session;

#[cfg(test)]
pub mod arbitrary;
