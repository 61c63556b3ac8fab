//! Portfolio site backend: the contact form relay, the route map pipeline,
//! and the scroll effect and theme logic shared with the frontend.

pub mod constants;
pub mod contact;
pub mod effects;
pub mod html_template;
pub mod route;
pub mod server;
pub mod settings;
pub mod theme;
