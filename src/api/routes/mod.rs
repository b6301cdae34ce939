pub mod health;
pub mod history;
pub mod ignore;
pub mod queue;
pub mod settings;
