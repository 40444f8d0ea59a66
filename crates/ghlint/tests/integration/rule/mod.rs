mod invalid_expression_usage;
mod invalid_local_action_path;
mod redundant_shell;
