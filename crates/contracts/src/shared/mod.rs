pub mod form_state;
