//! End-to-end gate scenarios: inbound message in, host events out.

mod common;

use blockgate::{HostEvent, InboundMessage};
use blockgate::config::Config;
use blockgate::db::{BlockRecord, BlockStore, Scope};
use blockgate::gate::{Decision, Notice, Reach, Stage, Subject, Verdict};
use common::{PLATFORM, TestHost, assert_reply, dispatched};

fn config(toml: &str) -> Config {
    Config::parse(toml).expect("valid test config")
}

#[tokio::test]
async fn blocked_channel_drops_everything_silently() {
    let t = TestHost::with_records(
        Config::default(),
        [BlockRecord::new(PLATFORM, Scope::channel("c1")).blocked_channel(true)],
    );

    assert!(t.say("c1", "u1", "/help").await.is_empty());
    // Admins too: without the trigger override they cannot reach commands.
    assert!(t.admin("c1", "admin", "取消拉黑频道 c1").await.is_empty());

    assert_eq!(dispatched(&t.say("c2", "u1", "/help").await), Some(Verdict::Allow));
}

#[tokio::test]
async fn trigger_override_lets_admin_unblock_channel() {
    let t = TestHost::with_records(
        config("[gate]\nallow_trigger = true\n"),
        [BlockRecord::new(PLATFORM, Scope::channel("c1")).blocked_channel(true)],
    );

    let events = t.admin("c1", "admin", "取消拉黑频道 c1").await;
    assert_reply(
        &events,
        Notice::Unblocked {
            subject: Subject::Channel,
            value: "c1".to_string(),
            reach: Reach::Channel,
        },
    );

    assert_eq!(dispatched(&t.say("c1", "u1", "/help").await), Some(Verdict::Allow));
}

#[tokio::test]
async fn whitelist_is_exclusive_and_beats_blocks() {
    let t = TestHost::with_records(
        config(
            r#"
            [[gate.command_targets]]
            command = "/x"
            target = "u1"
            mode = "whitelist"
            "#,
        ),
        [BlockRecord::new(PLATFORM, Scope::channel("c1"))
            .blocked_channel(true)
            .with_user("u1")],
    );

    assert_eq!(dispatched(&t.say("c1", "u1", "/x").await), Some(Verdict::Allow));
    assert!(t.say("c2", "u2", "/x").await.is_empty());
    // Other commands in c1 still hit the channel block.
    assert!(t.say("c1", "u1", "/y").await.is_empty());
}

#[tokio::test]
async fn shadowed_whitelist_row_is_never_consulted() {
    let t = TestHost::new(config(
        r#"
        [[gate.command_targets]]
        command = "/x"
        target = "u1"
        mode = "whitelist"

        [[gate.command_targets]]
        command = "/x"
        target = "u2"
        mode = "whitelist"
        "#,
    ));

    assert_eq!(dispatched(&t.say("c1", "u1", "/x").await), Some(Verdict::Allow));
    assert!(t.say("c1", "u2", "/x").await.is_empty());
}

#[tokio::test]
async fn channel_restricted_to_one_command() {
    let t = TestHost::new(config(
        r#"
        [[gate.channel_commands]]
        channel_id = "c1"
        command = "/roll"
        "#,
    ));

    assert_eq!(dispatched(&t.say("c1", "u1", "/roll").await), Some(Verdict::Allow));
    assert!(t.say("c1", "u1", "/help").await.is_empty());
    assert_eq!(dispatched(&t.say("c2", "u1", "/help").await), Some(Verdict::Allow));
}

#[tokio::test]
async fn global_and_channel_lists_are_unioned() {
    let t = TestHost::new(Config::default());

    t.admin("c1", "admin", "全局添加屏蔽词 /roll").await;
    t.admin("c1", "admin", "添加屏蔽词 /help").await;
    t.admin("c1", "admin", "全局拉黑用户 troll").await;

    assert!(t.say("c1", "u1", "/roll").await.is_empty());
    assert!(t.say("c2", "u1", "/roll").await.is_empty());
    assert!(t.say("c1", "u1", "/help").await.is_empty());
    assert_eq!(dispatched(&t.say("c2", "u1", "/help").await), Some(Verdict::Allow));
    assert!(t.say("c2", "troll", "hello").await.is_empty());

    // Keyword blocking matches the invoked command, not any substring.
    assert_eq!(
        dispatched(&t.say("c2", "u1", "please /roll").await),
        Some(Verdict::Allow)
    );

    // Other platforms are untouched.
    let discord = InboundMessage::new("discord", "c1", "troll", "/roll");
    assert_eq!(dispatched(&t.host.handle(discord).await), Some(Verdict::Allow));
}

#[tokio::test]
async fn unblock_rescue_reaches_blocked_keyword() {
    let t = TestHost::with_records(
        Config::default(),
        [BlockRecord::new(PLATFORM, Scope::channel("c1")).with_keyword("spam")],
    );

    assert!(t.say("c1", "u1", "spam now").await.is_empty());

    let events = t.admin("c1", "admin", "取消屏蔽词 spam").await;
    assert_reply(
        &events,
        Notice::Unblocked {
            subject: Subject::Keyword,
            value: "spam".to_string(),
            reach: Reach::Channel,
        },
    );

    assert_eq!(dispatched(&t.say("c1", "u1", "spam now").await), Some(Verdict::Allow));
}

#[tokio::test]
async fn rescue_does_not_help_blocked_users() {
    let t = TestHost::with_records(
        Config::default(),
        [BlockRecord::new(PLATFORM, Scope::Global)
            .with_keyword("spam")
            .with_user("admin")],
    );

    assert!(t.admin("c1", "admin", "全局取消屏蔽词 spam").await.is_empty());
    let global = t.store.get(PLATFORM, &Scope::Global).await.unwrap().unwrap();
    assert!(global.blocked_keywords.contains("spam"));
}

#[tokio::test]
async fn block_commands_are_idempotent() {
    let t = TestHost::new(Config::default());
    let blocked = |reach| Notice::Blocked {
        subject: Subject::User,
        value: "u9".to_string(),
        reach,
    };

    assert_reply(&t.admin("c1", "admin", "拉黑用户 u9").await, blocked(Reach::Channel));
    assert_reply(
        &t.admin("c1", "admin", "拉黑用户 u9").await,
        Notice::AlreadyBlocked {
            subject: Subject::User,
            value: "u9".to_string(),
            reach: Reach::Channel,
        },
    );
    assert_reply(&t.admin("c1", "admin", "全局拉黑用户 u9").await, blocked(Reach::Global));

    assert_reply(
        &t.admin("c1", "admin", "取消拉黑用户 nobody").await,
        Notice::NotBlocked {
            subject: Subject::User,
            value: "nobody".to_string(),
            reach: Reach::Channel,
        },
    );

    let channel = t
        .store
        .get(PLATFORM, &Scope::channel("c1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(channel.blocked_users.len(), 1);
    assert_eq!(t.store.len(), 2);
}

#[tokio::test]
async fn commands_need_authority_and_argument() {
    let t = TestHost::new(Config::default());

    assert_reply(
        &t.say("c1", "u1", "添加屏蔽词 spam").await,
        Notice::InsufficientAuthority { required: 3 },
    );
    assert_reply(
        &t.admin("c1", "admin", "添加屏蔽词").await,
        Notice::MissingArgument(Subject::Keyword),
    );
    assert!(t.store.is_empty());
}

#[tokio::test]
async fn self_guard_blocks_own_user_and_channel() {
    let t = TestHost::new(config("[gate]\nallow_self_operation = false\n"));

    assert_reply(&t.admin("c1", "admin", "拉黑用户 admin").await, Notice::CannotTargetSelf);
    assert_reply(&t.admin("c1", "admin", "拉黑频道 c1").await, Notice::CannotTargetSelf);
    // Keywords have no "self".
    assert_reply(
        &t.admin("c1", "admin", "添加屏蔽词 admin").await,
        Notice::Blocked {
            subject: Subject::Keyword,
            value: "admin".to_string(),
            reach: Reach::Channel,
        },
    );
    assert_reply(
        &t.admin("c1", "admin", "拉黑频道 c2").await,
        Notice::Blocked {
            subject: Subject::Channel,
            value: "c2".to_string(),
            reach: Reach::Channel,
        },
    );
}

#[tokio::test]
async fn auto_block_denies_first_message_of_new_channel() {
    let t = TestHost::new(config("[gate]\nauto_block_channels = true\nallow_trigger = true\n"));

    assert!(t.say("c9", "u1", "/help").await.is_empty());
    let record = t
        .store
        .get(PLATFORM, &Scope::channel("c9"))
        .await
        .unwrap()
        .unwrap();
    assert!(record.is_blocked_channel);

    assert_reply(
        &t.admin("c9", "admin", "取消拉黑频道 c9").await,
        Notice::Unblocked {
            subject: Subject::Channel,
            value: "c9".to_string(),
            reach: Reach::Channel,
        },
    );
    assert_eq!(dispatched(&t.say("c9", "u1", "/help").await), Some(Verdict::Allow));
}

#[tokio::test]
async fn outbound_filter_suppresses_matching_replies() {
    let t = TestHost::new(config(
        r#"
        [outbound]
        enabled = true

        [[outbound.rules]]
        pattern = "forbidden"

        [[outbound.rules]]
        pattern = "/^secret\\d+$/"
        regex = true
        "#,
    ));

    let suppressed = HostEvent::Suppressed {
        platform: PLATFORM.to_string(),
        channel_id: "c1".to_string(),
    };
    assert_eq!(t.host.send(PLATFORM, "c1", "a forbidden word".to_string()), suppressed);
    assert_eq!(t.host.send(PLATFORM, "c1", "Secret42".to_string()), suppressed);
    assert_eq!(
        t.host.send(PLATFORM, "c1", "secret 42".to_string()),
        HostEvent::Send {
            platform: PLATFORM.to_string(),
            channel_id: "c1".to_string(),
            content: "secret 42".to_string(),
        }
    );

    // Command replies go through the same filter.
    assert_eq!(t.admin("c1", "admin", "添加屏蔽词 forbidden").await, vec![suppressed]);
}

#[tokio::test]
async fn shadowed_rule_after_blacklist_is_unreachable() {
    let t = TestHost::new(config(
        r#"
        [[gate.command_targets]]
        command = "/x"
        target = "u1"
        mode = "blacklist"

        [[gate.command_targets]]
        command = "/x"
        target = "u2"
        mode = "whitelist"
        "#,
    ));

    let from_u2 = InboundMessage::new(PLATFORM, "c1", "u2", "/x");
    assert_eq!(
        t.host.pipeline().decide(&from_u2).await,
        Decision::allow(Stage::Fallthrough)
    );
    // u3 would be denied by the whitelist, but it is never consulted.
    assert_eq!(dispatched(&t.say("c1", "u3", "/x").await), Some(Verdict::Allow));
    assert!(t.say("c1", "u1", "/x").await.is_empty());
}

#[tokio::test]
async fn global_keyword_rescue_is_a_bypass() {
    let t = TestHost::with_records(
        Config::default(),
        [BlockRecord::new(PLATFORM, Scope::Global).with_keyword("spam")],
    );

    let msg = InboundMessage::new(PLATFORM, "c1", "u1", "取消屏蔽词 spam");
    assert_eq!(
        t.host.pipeline().decide(&msg).await,
        Decision::bypass(Stage::UnblockRescue)
    );
}
