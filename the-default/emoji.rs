use the_lib::{
  Tendril,
  provider::{
    Suggestion,
    SuggestionProvider,
  },
  trigger::{
    self,
    Trigger,
  },
};

pub const EMOJI_TRIGGER: &str = r"(?:^|\s)(?P<token>:(?P<query>[a-z0-9_+\-]{2,}))$";

/// Shortcodes in lookup order.
pub static EMOJI: &[(&str, &str)] = &[
  ("+1", "👍"),
  ("-1", "👎"),
  ("100", "💯"),
  ("alarm_clock", "⏰"),
  ("angry", "😠"),
  ("apple", "🍎"),
  ("art", "🎨"),
  ("astonished", "😲"),
  ("baby", "👶"),
  ("balloon", "🎈"),
  ("banana", "🍌"),
  ("bangbang", "‼️"),
  ("beer", "🍺"),
  ("beers", "🍻"),
  ("bell", "🔔"),
  ("bike", "🚲"),
  ("birthday", "🎂"),
  ("blush", "😊"),
  ("bomb", "💣"),
  ("book", "📖"),
  ("bookmark", "🔖"),
  ("boom", "💥"),
  ("broken_heart", "💔"),
  ("bug", "🐛"),
  ("bulb", "💡"),
  ("cake", "🍰"),
  ("calendar", "📆"),
  ("camera", "📷"),
  ("cat", "🐱"),
  ("check", "✔️"),
  ("cherries", "🍒"),
  ("clap", "👏"),
  ("clipboard", "📋"),
  ("cloud", "☁️"),
  ("coffee", "☕"),
  ("computer", "💻"),
  ("confused", "😕"),
  ("construction", "🚧"),
  ("cookie", "🍪"),
  ("cool", "🆒"),
  ("cry", "😢"),
  ("crying_cat_face", "😿"),
  ("dart", "🎯"),
  ("disappointed", "😞"),
  ("dizzy", "💫"),
  ("dog", "🐶"),
  ("dollar", "💵"),
  ("earth_africa", "🌍"),
  ("email", "📧"),
  ("eyes", "👀"),
  ("facepalm", "🤦"),
  ("fire", "🔥"),
  ("fireworks", "🎆"),
  ("fish", "🐟"),
  ("flushed", "😳"),
  ("frowning", "😦"),
  ("gem", "💎"),
  ("gift", "🎁"),
  ("grimacing", "😬"),
  ("grin", "😁"),
  ("grinning", "😀"),
  ("hammer", "🔨"),
  ("heart", "❤️"),
  ("heart_eyes", "😍"),
  ("hourglass", "⌛"),
  ("hugs", "🤗"),
  ("hushed", "😯"),
  ("innocent", "😇"),
  ("joy", "😂"),
  ("key", "🔑"),
  ("kiss", "💋"),
  ("kissing_heart", "😘"),
  ("laughing", "😆"),
  ("link", "🔗"),
  ("lock", "🔒"),
  ("mag", "🔍"),
  ("memo", "📝"),
  ("moon", "🌙"),
  ("muscle", "💪"),
  ("neutral_face", "😐"),
  ("no_entry", "⛔"),
  ("ok_hand", "👌"),
  ("open_mouth", "😮"),
  ("package", "📦"),
  ("partying_face", "🥳"),
  ("pencil2", "✏️"),
  ("pensive", "😔"),
  ("pizza", "🍕"),
  ("point_down", "👇"),
  ("point_left", "👈"),
  ("point_right", "👉"),
  ("point_up", "☝️"),
  ("poop", "💩"),
  ("pray", "🙏"),
  ("question", "❓"),
  ("rage", "😡"),
  ("rainbow", "🌈"),
  ("raised_hands", "🙌"),
  ("recycle", "♻️"),
  ("relaxed", "☺️"),
  ("relieved", "😌"),
  ("rocket", "🚀"),
  ("rofl", "🤣"),
  ("rose", "🌹"),
  ("scream", "😱"),
  ("see_no_evil", "🙈"),
  ("shrug", "🤷"),
  ("slightly_frowning_face", "🙁"),
  ("slightly_smiling_face", "🙂"),
  ("sleeping", "😴"),
  ("smile", "😄"),
  ("smiley", "😃"),
  ("smirk", "😏"),
  ("snowflake", "❄️"),
  ("sob", "😭"),
  ("sparkles", "✨"),
  ("star", "⭐"),
  ("stuck_out_tongue", "😛"),
  ("stuck_out_tongue_winking_eye", "😜"),
  ("sun", "☀️"),
  ("sunglasses", "😎"),
  ("sweat_smile", "😅"),
  ("tada", "🎉"),
  ("thinking", "🤔"),
  ("thumbsdown", "👎"),
  ("thumbsup", "👍"),
  ("tired_face", "😫"),
  ("trophy", "🏆"),
  ("umbrella", "☔"),
  ("unamused", "😒"),
  ("upside_down_face", "🙃"),
  ("v", "✌️"),
  ("warning", "⚠️"),
  ("wave", "👋"),
  ("white_check_mark", "✅"),
  ("wink", "😉"),
  ("worried", "😟"),
  ("x", "❌"),
  ("yum", "😋"),
  ("zap", "⚡"),
  ("zzz", "💤"),
];

/// `:shortcode` completion from [`EMOJI`].
pub struct EmojiProvider {
  trigger: Trigger,
  max:     usize,
}

impl EmojiProvider {
  pub fn new(max: usize) -> trigger::Result<Self> {
    Ok(Self {
      trigger: Trigger::new(EMOJI_TRIGGER)?,
      max,
    })
  }
}

impl SuggestionProvider for EmojiProvider {
  fn name(&self) -> &str {
    "emoji"
  }

  fn trigger(&self) -> &Trigger {
    &self.trigger
  }

  fn data(&self, query: &str) -> Vec<Suggestion> {
    let query = query.to_lowercase();
    let prefixed = EMOJI.iter().filter(|(code, _)| code.starts_with(&query));
    let containing = EMOJI
      .iter()
      .filter(|(code, _)| !code.starts_with(&query) && code.contains(&query));

    prefixed
      .chain(containing)
      .take(self.max)
      .map(|(code, emoji)| Suggestion::new(*code, *emoji))
      .collect()
  }

  fn render(&self, suggestion: &Suggestion) -> String {
    format!("{} :{}:", suggestion.value, suggestion.key)
  }

  fn complete(&self, suggestion: &Suggestion) -> Tendril {
    Tendril::from(suggestion.value.as_str())
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn prefix_matches_come_first() {
    let provider = EmojiProvider::new(8).unwrap();
    let codes: Vec<String> = provider
      .data("smil")
      .into_iter()
      .map(|suggestion| suggestion.key)
      .collect();
    assert_eq!(codes, vec![
      "smile",
      "smiley",
      "slightly_smiling_face",
      "sweat_smile"
    ]);
  }

  #[test]
  fn list_is_capped() {
    let provider = EmojiProvider::new(3).unwrap();
    assert_eq!(provider.data("e").len(), 3);
    assert!(EmojiProvider::new(0).unwrap().data("smile").is_empty());
  }

  #[test]
  fn renders_emoji_with_shortcode() {
    let provider = EmojiProvider::new(8).unwrap();
    let suggestion = Suggestion::new("tada", "🎉");
    assert_eq!(provider.render(&suggestion), "🎉 :tada:");
    assert_eq!(provider.complete(&suggestion).as_str(), "🎉");
  }

  #[test]
  fn trigger_needs_two_chars_after_whitespace() {
    let provider = EmojiProvider::new(8).unwrap();
    assert_eq!(provider.trigger().find("hi :ta").unwrap().query, "ta");
    assert!(provider.trigger().find("hi :t").is_none());
    assert!(provider.trigger().find("12:30").is_none());
  }
}
