use std::{io::Write, path::Path};

use anyhow::Context;
use forum_client::{
    api::{Comment, Post, Topic},
    CommentForest, LoginInfo, Visibility,
};

const INDENT: &str = "    ";

pub fn load_comments(path: &Path) -> anyhow::Result<Vec<Comment>> {
    let data = std::fs::read(path).with_context(|| format!("reading {path:?}"))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing comments from {path:?}"))
}

pub fn topics(out: &mut impl Write, topics: &[Topic]) -> anyhow::Result<()> {
    for t in topics {
        writeln!(
            out,
            "#{} {} ({} posts)\n{INDENT}{}",
            t.topic_id.0, t.name, t.post_count, t.description
        )?;
    }
    Ok(())
}

pub fn posts(
    out: &mut impl Write,
    posts: &[Post],
    login: &LoginInfo,
) -> anyhow::Result<()> {
    for p in posts {
        write!(
            out,
            "#{} {} by {} on {}",
            p.post_id.0,
            p.title,
            p.author(),
            p.created_at.format("%Y-%m-%d %H:%M")
        )?;
        if login.can_delete_post(p) {
            write!(out, " (deletable)")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn post(out: &mut impl Write, p: &Post) -> anyhow::Result<()> {
    writeln!(
        out,
        "{}\nby {} on {}\n\n{}\n",
        p.title,
        p.author(),
        p.created_at.format("%Y-%m-%d %H:%M"),
        p.body
    )?;
    Ok(())
}

/// Prints the discussion one comment per block, replies indented below their
/// parent. Comments `login` may delete are tagged.
pub fn thread(
    out: &mut impl Write,
    forest: &CommentForest,
    login: &LoginInfo,
) -> anyhow::Result<()> {
    for entry in forest.thread() {
        let indent = INDENT.repeat(entry.depth);
        let c = &forest.node(entry.node).comment;
        if entry.visibility == Visibility::Placeholder {
            writeln!(out, "{indent}[removed]")?;
            continue;
        }
        write!(
            out,
            "{indent}#{} {} on {}",
            c.id.0,
            c.author(),
            c.created_at.format("%Y-%m-%d %H:%M")
        )?;
        if login.can_delete_comment(c) {
            write!(out, " (deletable)")?;
        }
        writeln!(out)?;
        for line in c.body.lines() {
            writeln!(out, "{indent}{INDENT}{line}")?;
        }
    }
    Ok(())
}
