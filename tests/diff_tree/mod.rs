mod abbreviated_commit_id_is_rejected;
mod merge_commit_is_compared_with_first_parent;
mod mode_and_type_changes_between_commits;
mod root_commit_prints_nothing;
mod show_name_status_for_modified_and_inserted_files;
mod show_raw_changes_between_commits;
