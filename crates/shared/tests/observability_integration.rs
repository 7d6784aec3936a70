//! 可观测性与配置集成测试

// ============================================================================
// 指标记录测试
// ============================================================================

mod metrics_tests {
    use reward_shared::observability::metrics::{
        get_handle, record_command, record_reward_created, record_reward_request_created,
        record_status_transition,
    };

    #[test]
    fn test_record_command() {
        record_command("create_reward", "success", 0.01);
        record_command("update_reward_request_status", "INVALID_STATUS_TRANSITION", 0.02);
        record_command("get_rewards_by_cursor", "success", 0.003);
    }

    #[test]
    fn test_record_business_counters() {
        for reward_type in ["POINT", "ITEM", "COUPON", "BADGE"] {
            record_reward_created(reward_type);
        }
        record_reward_request_created();
        record_status_transition("PENDING", "APPROVED");
        record_status_transition("PENDING", "REJECTED");
    }

    #[test]
    fn test_metrics_with_edge_cases() {
        // 空字符串
        record_command("", "", 0.0);

        // 极端持续时间
        record_command("slow", "success", 999.99);
    }

    #[test]
    fn test_handle_absent_without_init() {
        assert!(get_handle().is_none());
    }
}

// ============================================================================
// 配置测试
// ============================================================================

mod config_tests {
    use reward_shared::config::{AppConfig, StorageBackend};
    use reward_shared::observability::ObservabilityConfig;

    #[test]
    fn test_default_config_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.request_timeout_seconds, 30);
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert!(config.database.run_migrations);
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_storage_backend_deserialize() {
        let backend: StorageBackend = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(backend, StorageBackend::Memory);

        let backend: StorageBackend = serde_json::from_str("\"postgres\"").unwrap();
        assert_eq!(backend, StorageBackend::Postgres);

        assert!(serde_json::from_str::<StorageBackend>("\"mysql\"").is_err());
    }

    #[test]
    fn test_observability_config_partial() {
        let config: ObservabilityConfig =
            serde_json::from_str(r#"{"log_level": "debug", "json_logs": true}"#).unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(config.json_logs);
        assert!(!config.metrics_enabled);
        assert_eq!(config.metrics_port, 9090);
    }

    #[test]
    fn test_load_or_default_returns_error_with_fallback() {
        let dir = std::env::temp_dir().join(format!("reward-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("default.toml"), "[server\nport = ").unwrap();

        // 本测试二进制中只有这里读取 CONFIG_DIR
        unsafe { std::env::set_var("CONFIG_DIR", &dir) };
        let (config, error) = AppConfig::load_or_default("reward-service");
        unsafe { std::env::remove_var("CONFIG_DIR") };
        std::fs::remove_dir_all(&dir).unwrap();

        assert!(error.is_some());
        assert_eq!(config.service_name, "reward-service");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
    }
}
