pub mod picker_app;
