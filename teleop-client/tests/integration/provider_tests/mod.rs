pub mod test_action_modes;
pub mod test_predictive_display;
pub mod test_unknown_labels;
