//! End-to-end action tests against a real git checkout with a bare remote.
//!
//! These drive the registry through `ProcessRunner`, so `git` must be on PATH.

use siteops::actions::{ActionRegistry, DeleteArticleArgs, PublishPostArgs};
use siteops::io::process::ProcessRunner;
use siteops::test_support::TestRepo;

fn registry(repo: &TestRepo) -> ActionRegistry<ProcessRunner> {
    let workdir = repo.workdir();
    ActionRegistry::new(workdir.clone(), ProcessRunner::new(workdir))
}

/// Clean tree: commit reports nothing to commit, push is skipped.
#[test]
fn clean_tree_skips_push_with_notice() {
    let repo = TestRepo::new().expect("repo");
    let before = repo.commit_count().expect("count");

    let text = registry(&repo).commit_code(None).expect("commit");

    assert!(text.starts_with("$ git add -A\n"));
    assert!(text.contains("$ git commit -m chore: automated commit\n"));
    assert!(text.contains("nothing to commit"));
    assert!(text.ends_with("\nNo changes to push.\n"));
    assert!(!text.contains("$ git push"));
    assert_eq!(repo.commit_count().expect("count"), before);
}

/// Pending change: committed with the given message and pushed to origin.
#[test]
fn pending_change_is_committed_and_pushed() {
    let repo = TestRepo::new().expect("repo");
    repo.write_file("src/pages/index.astro", "<h1>hi</h1>\n")
        .expect("write");

    let text = registry(&repo)
        .commit_code(Some("feat: test commit"))
        .expect("commit");

    assert!(text.contains("\n$ git push\n"));
    assert!(!text.contains("No changes to push."));
    assert_eq!(repo.head_subject().expect("head"), "feat: test commit");
    assert_eq!(repo.remote_head_subject().expect("remote head"), "feat: test commit");
}

#[test]
fn publish_blog_post_without_deploy_commits_article() {
    let repo = TestRepo::new().expect("repo");
    let args = PublishPostArgs {
        directory: "src/content/blog".to_string(),
        content: "# Launch notes\n\nWe shipped.".to_string(),
        filename: "launch-notes.md".to_string(),
        commit_message: None,
        deploy: false,
    };

    let text = registry(&repo).publish_blog_post(&args).expect("publish");

    assert!(text.starts_with("✓ Saved article to: "));
    assert!(!text.contains("=== Deployment ==="));
    assert_eq!(
        repo.remote_head_subject().expect("remote head"),
        "feat: publish launch-notes.md"
    );
    let saved = std::fs::read_to_string(repo.path().join("src/content/blog/launch-notes.md"))
        .expect("read article");
    assert!(saved.starts_with("---\ntitle: \"Launch notes\"\n"));
}

#[test]
fn delete_article_commits_removal_locally_only() {
    let repo = TestRepo::new().expect("repo");
    repo.write_file("src/content/blog/old.md", "old\n").expect("write");
    let registry = registry(&repo);
    registry
        .commit_code(Some("docs: add old post"))
        .expect("seed commit");

    let text = registry
        .delete_article(&DeleteArticleArgs {
            filepath: "src/content/blog/old.md".to_string(),
            commit: true,
            push: false,
        })
        .expect("delete");

    assert!(!repo.path().join("src/content/blog/old.md").exists());
    assert!(!text.contains("$ git push"));
    assert_eq!(repo.head_subject().expect("head"), "feat: remove article old.md");
    assert_eq!(
        repo.remote_head_subject().expect("remote head"),
        "docs: add old post"
    );
}
