//! Commit history listing
//!
//! - `rev_list`: first-parent walk from a branch tip to the root
//! - [`format_commit_record`]: the record `log`, `global-log` print per commit
//!
//! ## Record Format
//!
//! ```text
//! ===
//! commit <id>
//! Merge: <parent0 short> <parent1 short>   (merge commits only)
//! Date: Thu Jan 1 00:00:00 1970 +0000
//! <message>
//!
//! ```

pub mod rev_list;

use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;

pub fn format_commit_record(oid: &ObjectId, commit: &Commit) -> String {
    let mut record = format!("===\n{}\n", format!("commit {oid}").yellow());

    if commit.is_merge() {
        let parents = commit.parents();
        record.push_str(&format!(
            "Merge: {} {}\n",
            parents[0].to_short_oid(),
            parents[1].to_short_oid()
        ));
    }

    record.push_str(&format!("Date: {}\n", commit.readable_timestamp()));
    record.push_str(commit.message());
    record.push_str("\n\n");

    record
}
