pub mod sensitivity;
pub mod simulate;
