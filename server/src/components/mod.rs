pub mod form;
pub mod layout;
pub mod product;
pub mod ui;
