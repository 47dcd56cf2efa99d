pub mod health;
pub mod submissions;
pub mod submit_form;
