use anyhow::Result;
use ghia::utils::validation::Validate;
use ghia::{
    load_rule_set, Assigner, AssignerError, AuthConfig, GitHubClient, OutcomeStatus, RunSettings,
    Strategy,
};
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use serde_json::json;
use tempfile::TempDir;

const RULES: &str = r#"
[patterns]
alice = "label:bug"
bob = "any:urgent"
dan = '''
text:regression
title:(?i)\bslow\b
'''

[fallback]
label = "Need assignment"
"#;

struct Fixture {
    dir: TempDir,
    server: MockServer,
    auth: AuthConfig,
    rules_path: std::path::PathBuf,
}

fn fixture() -> Result<Fixture> {
    let dir = TempDir::new()?;
    let server = MockServer::start();

    let auth_path = dir.path().join("auth.toml");
    std::fs::write(
        &auth_path,
        format!(
            "[github]\nrepo = \"octo/repo\"\ntoken = \"t0ken\"\napi_url = \"{}\"\n",
            server.base_url()
        ),
    )?;
    let rules_path = dir.path().join("rules.toml");
    std::fs::write(&rules_path, RULES)?;

    let auth = AuthConfig::from_file(&auth_path)?;
    auth.validate()?;

    Ok(Fixture {
        dir,
        server,
        auth,
        rules_path,
    })
}

fn open_issues() -> serde_json::Value {
    json!([
        {
            "number": 1,
            "html_url": "https://github.com/octo/repo/issues/1",
            "title": "Crash on load",
            "body": null,
            "labels": [{"name": "bug"}, {"name": "ui"}],
            "assignees": []
        },
        {
            "number": 2,
            "html_url": "https://github.com/octo/repo/issues/2",
            "title": "Please fix urgent bug",
            "body": "",
            "labels": [],
            "assignees": [{"login": "carol"}]
        },
        {
            "number": 3,
            "html_url": "https://github.com/octo/repo/issues/3",
            "title": "Startup is slow",
            "body": "Looks like a regression from 1.2",
            "labels": [],
            "assignees": [{"login": "eve"}]
        },
        {
            "number": 4,
            "html_url": "https://github.com/octo/repo/issues/4",
            "title": "Typo in README",
            "body": "teh -> the",
            "labels": [{"name": "docs"}],
            "assignees": []
        }
    ])
}

fn settings(strategy: Strategy, dry_run: bool) -> RunSettings {
    RunSettings {
        repo: "octo/repo".to_string(),
        strategy,
        dry_run,
        concurrency: 2,
    }
}

fn client(fixture: &Fixture) -> Result<GitHubClient> {
    Ok(GitHubClient::new(
        fixture.auth.api_url(),
        fixture.auth.credentials()?,
    )?)
}

#[tokio::test]
async fn test_append_run_updates_matching_issues() -> Result<()> {
    let fixture = fixture()?;
    let server = &fixture.server;

    let list_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/octo/repo/issues")
            .header("authorization", "token t0ken");
        then.status(200).json_body(open_issues());
    });
    let issue_one = server.mock(|when, then| {
        when.method(PATCH)
            .path("/repos/octo/repo/issues/1")
            .json_body(json!({"assignees": ["alice"]}));
        then.status(200).json_body(json!({}));
    });
    let issue_two = server.mock(|when, then| {
        when.method(PATCH)
            .path("/repos/octo/repo/issues/2")
            .json_body(json!({"assignees": ["bob", "carol"]}));
        then.status(200).json_body(json!({}));
    });
    let issue_three = server.mock(|when, then| {
        when.method(PATCH)
            .path("/repos/octo/repo/issues/3")
            .json_body(json!({"assignees": ["dan", "eve"]}));
        then.status(200).json_body(json!({}));
    });
    let issue_four = server.mock(|when, then| {
        when.method(PATCH)
            .path("/repos/octo/repo/issues/4")
            .json_body(json!({"labels": ["Need assignment", "docs"]}));
        then.status(200).json_body(json!({}));
    });

    let rules = load_rule_set(&fixture.rules_path)?;
    let report = Assigner::new(client(&fixture)?, rules, settings(Strategy::Append, false))
        .run()
        .await?;

    list_mock.assert();
    issue_one.assert();
    issue_two.assert();
    issue_three.assert();
    issue_four.assert();

    assert!(!report.has_failures());
    assert_eq!(report.summary().updated, 4);
    Ok(())
}

#[tokio::test]
async fn test_set_strategy_leaves_assigned_issues_alone() -> Result<()> {
    let fixture = fixture()?;
    let server = &fixture.server;

    server.mock(|when, then| {
        when.method(GET).path("/repos/octo/repo/issues");
        then.status(200).json_body(open_issues());
    });
    let assigned_issue = server.mock(|when, then| {
        when.method(PATCH).path("/repos/octo/repo/issues/2");
        then.status(200);
    });
    let unassigned_issue = server.mock(|when, then| {
        when.method(PATCH)
            .path("/repos/octo/repo/issues/1")
            .json_body(json!({"assignees": ["alice"]}));
        then.status(200);
    });
    server.mock(|when, then| {
        when.method(PATCH).path("/repos/octo/repo/issues/4");
        then.status(200);
    });

    let rules = load_rule_set(&fixture.rules_path)?;
    let report = Assigner::new(client(&fixture)?, rules, settings(Strategy::Set, false))
        .run()
        .await?;

    assigned_issue.assert_hits(0);
    unassigned_issue.assert();

    let second = &report.outcomes[1];
    assert_eq!(second.decision.final_assignees.len(), 1);
    assert!(second.decision.final_assignees.contains("carol"));
    assert_eq!(second.status, OutcomeStatus::Unchanged);
    Ok(())
}

#[tokio::test]
async fn test_change_strategy_replaces_and_reports_failures() -> Result<()> {
    let fixture = fixture()?;
    let server = &fixture.server;

    server.mock(|when, then| {
        when.method(GET).path("/repos/octo/repo/issues");
        then.status(200).json_body(open_issues());
    });
    let replaced = server.mock(|when, then| {
        when.method(PATCH)
            .path("/repos/octo/repo/issues/3")
            .json_body(json!({"assignees": ["dan"]}));
        then.status(200);
    });
    let forbidden = server.mock(|when, then| {
        when.method(PATCH).path("/repos/octo/repo/issues/2");
        then.status(403).json_body(json!({"message": "Forbidden"}));
    });
    for number in [1, 4] {
        server.mock(|when, then| {
            when.method(PATCH)
                .path(format!("/repos/octo/repo/issues/{}", number));
            then.status(200);
        });
    }

    let rules = load_rule_set(&fixture.rules_path)?;
    let report = Assigner::new(client(&fixture)?, rules, settings(Strategy::Change, false))
        .run()
        .await?;

    replaced.assert();
    forbidden.assert();

    assert!(report.has_failures());
    let summary = report.summary();
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.updated, 3);
    match &report.outcomes[1].status {
        OutcomeStatus::Failed(message) => assert!(message.contains("Forbidden")),
        other => panic!("unexpected status: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_dry_run_never_patches() -> Result<()> {
    let fixture = fixture()?;
    let server = &fixture.server;

    server.mock(|when, then| {
        when.method(GET).path("/repos/octo/repo/issues");
        then.status(200).json_body(open_issues());
    });
    let any_patch = server.mock(|when, then| {
        when.method(PATCH);
        then.status(200);
    });

    let rules = load_rule_set(&fixture.rules_path)?;
    let report = Assigner::new(client(&fixture)?, rules, settings(Strategy::Change, true))
        .run()
        .await?;

    any_patch.assert_hits(0);
    assert_eq!(report.summary().dry_run, 4);
    assert!(!report.has_failures());
    Ok(())
}

#[tokio::test]
async fn test_listing_failure_is_fatal() -> Result<()> {
    let fixture = fixture()?;
    fixture.server.mock(|when, then| {
        when.method(GET).path("/repos/octo/repo/issues");
        then.status(401).json_body(json!({"message": "Bad credentials"}));
    });

    let rules = load_rule_set(&fixture.rules_path)?;
    let result = Assigner::new(client(&fixture)?, rules, settings(Strategy::Append, false))
        .run()
        .await;

    match result {
        Err(AssignerError::IssueFetchError { message, .. }) => {
            assert!(message.contains("Bad credentials"))
        }
        other => panic!("unexpected result: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_malformed_rules_fail_before_any_request() -> Result<()> {
    let fixture = fixture()?;
    let list_mock = fixture.server.mock(|when, then| {
        when.method(GET).path("/repos/octo/repo/issues");
        then.status(200).json_body(json!([]));
    });

    let bad_rules = fixture.dir.path().join("bad.toml");
    std::fs::write(&bad_rules, "[patterns]\nmallory = \"bogus-no-colon\"\n")?;

    let err = load_rule_set(&bad_rules).unwrap_err();
    assert!(matches!(err, AssignerError::ConfigParseError { .. }));
    assert!(err.is_config_error());
    list_mock.assert_hits(0);
    Ok(())
}
