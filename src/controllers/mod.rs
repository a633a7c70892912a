pub mod family_controller;
