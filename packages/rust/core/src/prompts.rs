//! Instruction templates sent to the generator.

/// Instruction for the single aggregate call that yields the report payload.
pub fn analysis_prompt(team: &str) -> String {
    format!(
        r#"You are an NFL analyst writing the data payload for a weekly {team} fan report.

The raw data below has three sections:
  1. GENERAL NEWS: recent headlines about the team
  2. REDDIT DATA: hot posts and top comments from the team subreddit
  3. OFFSEASON / FRONT-OFFICE NEWS: roster, draft and front-office headlines

Reply with one JSON object and nothing else. No markdown fences, no commentary.

{{
  "season_note": "<short phrase naming the current point of the NFL calendar, taken from the news>",
  "executive_summary": "<2-3 sentences on the most important thing happening with the team, plain journalistic tone>",
  "sentiment_score": <integer 0-100 for fan mood in the Reddit data: 0-20 angry, 21-35 frustrated, 36-49 mixed-negative, 50 neutral, 51-64 mixed-positive, 65-79 optimistic, 80-100 euphoric>,
  "sentiment_label": "<2-3 word label matching the score>",
  "sentiment_trend": "<short trend note, or 'Stable' if the data does not show one>",
  "sentiment_breakdown": {{ "positive": <integer>, "neutral": <integer>, "negative": <integer> }},
  "sentiment_keywords": ["<topic>", "<topic>", "<topic>", "<topic>"],
  "war_room_intro": "<one sentence on the main front-office priority, from the offseason news only>",
  "war_room_items": [
    {{ "title": "<short label>", "summary": "<one sentence from the data>" }}
  ]
}}

Rules:
- Use only the data provided. Do not invent players, transactions or events.
- sentiment_breakdown values are percentages and must sum to 100.
- war_room_items: 2-4 items, as many as the data supports. Do not pad.
- sentiment_keywords: real topics under discussion (players, events, themes).
- Use double quotes for every string so the JSON parses."#
    )
}

/// Instruction for summarizing an image or video post from its title alone.
pub const MEDIA_TAKE_PROMPT: &str = "\
You are summarizing a Reddit post from an NFL team subreddit. The post is an \
image or video you cannot see. Using only its title, write exactly one \
sentence describing what the post shares. Do not invent details that are not \
in the title. Reply with the sentence only.";

/// Instruction for summarizing a text post with its discussion.
pub const DISCUSSION_TAKE_PROMPT: &str = "\
You are summarizing a Reddit post from an NFL team subreddit for a weekly fan \
newsletter. Using the title, the post body and the top comments provided, \
write 2-3 sentences capturing what the poster is saying and how the community \
is reacting. Stay neutral and use only the provided text. Reply with the \
summary only.";
