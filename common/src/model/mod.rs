pub mod card;
pub mod form;
pub mod organisation;
pub mod template;
