/// Short status line describing today's count, the way it's shown in a menu bar.
pub fn format_count(count: u64) -> String {
    match count {
        0 => "Waiting for first keystroke...".into(),
        1 => "👍 First key!".into(),
        _ => {
            let prefix = match count {
                0..500 => "👍 ",
                500..1000 => "🏃 ",
                1000..5000 => "💨 ",
                5000..10000 => "🙌 ",
                10000..20000 => "🚀 ",
                20000..30000 => "🥳 ",
                30000..=40000 => "🔥 ",
                40001..=60000 => "🤯 ",
                _ => "",
            };
            let suffix = if count < 100 { " today" } else { "" };
            format!("{prefix}{count} keys{suffix}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::format_count;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "Waiting for first keystroke...");
        assert_eq!(format_count(1), "👍 First key!");
        assert_eq!(format_count(42), "👍 42 keys today");
        assert_eq!(format_count(100), "👍 100 keys");
        assert_eq!(format_count(500), "🏃 500 keys");
        assert_eq!(format_count(40000), "🔥 40000 keys");
        assert_eq!(format_count(40001), "🤯 40001 keys");
        assert_eq!(format_count(60001), "60001 keys");
    }
}
