//! Keyword-to-reply matching for the casual chat responder.
//!
//! Categories are scanned in declaration order and triggers within a category
//! in declaration order; the first trigger contained in the normalised input
//! wins. Only the reply inside the selected category is random.

use rand::Rng;
use rand::seq::SliceRandom;

/// A group of trigger phrases sharing one pool of replies.
#[derive(Debug)]
pub struct Category {
    /// Stable identifier, used by topic hints and tests
    pub name: &'static str,
    /// Lowercase phrases that select this category
    pub triggers: &'static [&'static str],
    /// Replies picked uniformly at random
    pub responses: &'static [&'static str],
}

/// How a reply was chosen.
#[derive(Debug, Clone, Copy)]
pub enum Selection {
    /// A trigger phrase matched the message
    Trigger(&'static Category),
    /// Nothing matched, but the channel topic pointed at a category
    Topic(&'static Category),
    /// Nothing matched at all
    Fallback,
}

/// Reply categories in match priority order.
pub const CATEGORIES: &[Category] = &[
    Category {
        name: "greetings",
        triggers: &[
            "hi", "hello", "hey", "sup", "yo", "whats up", "what's up", "wassup", "hii", "heyy",
            "heyo",
        ],
        responses: &[
            "heyyy",
            "yooo whats good",
            "hey hey",
            "sup!",
            "ayy whats up",
            "hii",
            "heya",
            "yo yo",
        ],
    },
    Category {
        name: "goodbye",
        triggers: &[
            "bye", "gn", "goodnight", "good night", "cya", "gtg", "gotta go", "im out", "leaving",
        ],
        responses: &[
            "laterr", "byee", "cya!", "peace out", "gn!", "take care", "see ya", "bye bye",
        ],
    },
    Category {
        name: "how_are_you",
        triggers: &[
            "how are you",
            "how r u",
            "hru",
            "how you doing",
            "how are u",
            "wbu",
            "and you",
        ],
        responses: &[
            "im good! wbu?",
            "chillin hbu",
            "pretty good ngl, u?",
            "im vibing, how about u",
            "doing alright wby",
        ],
    },
    Category {
        name: "thanks",
        triggers: &["thanks", "thank you", "thx", "ty", "tysm", "appreciate"],
        responses: &["np!", "no problem!", "ofc!", "anytime", "gotchu", "no worries"],
    },
    Category {
        name: "sorry",
        triggers: &["sorry", "my bad", "mb", "apologize", "sry"],
        responses: &["ur good dw", "its fine lol", "no worries", "all good", "dw about it"],
    },
    Category {
        name: "laughter",
        triggers: &[
            "lol", "lmao", "lmfao", "haha", "hahaha", "rofl", "dead", "💀", "crying",
        ],
        responses: &[
            "lmaoo",
            "im dead 💀",
            "LMAO",
            "stoppp 😭",
            "bruhhh",
            "hahaha fr",
            "lolol",
        ],
    },
    Category {
        name: "agreement",
        triggers: &[
            "ikr", "fr", "facts", "true", "same", "real", "exactly", "right", "yes", "yeah", "yea",
            "yep",
        ],
        responses: &[
            "frfr",
            "literally",
            "on god",
            "100%",
            "big facts",
            "so true",
            "realest thing ever",
        ],
    },
    Category {
        name: "disagreement",
        triggers: &[
            "no", "nah", "nope", "cap", "false", "wrong", "disagree", "dont think so",
        ],
        responses: &[
            "wait really?",
            "hmm idk about that",
            "u sure?",
            "lowkey disagree ngl",
            "interesting take",
        ],
    },
    Category {
        name: "confusion",
        triggers: &[
            "what", "huh", "wdym", "confused", "idk", "i dont get it", "explain", "?",
        ],
        responses: &[
            "wdym?",
            "wait what happened",
            "im confused too ngl",
            "huh??",
            "explain pls",
        ],
    },
    Category {
        name: "excitement",
        triggers: &[
            "omg", "yay", "lets go", "pog", "hype", "excited", "cant wait", "finally", "yess",
        ],
        responses: &[
            "LETS GOOO",
            "yooo thats hype",
            "W",
            "im so hyped",
            "ayyyy",
            "poggers",
        ],
    },
    Category {
        name: "sadness",
        triggers: &[
            "sad", "upset", "depressed", "crying", "bad day", "not ok", "stressed", "tired",
            "exhausted",
        ],
        responses: &[
            "aw man that sucks",
            "u ok?",
            "that's rough :(",
            "im here if u wanna talk",
            "sending good vibes",
        ],
    },
    Category {
        name: "bored",
        triggers: &["bored", "boring", "nothing to do", "so bored"],
        responses: &[
            "same tbh",
            "mood",
            "lets do something",
            "boredom hits different",
            "felt that",
        ],
    },
    Category {
        name: "gaming",
        triggers: &[
            "game", "gaming", "play", "playing", "fortnite", "minecraft", "valorant", "roblox",
            "cod", "apex",
        ],
        responses: &[
            "ooh what game",
            "gaming time lets go",
            "what u playing?",
            "nice what game tho",
            "im down to play",
        ],
    },
    Category {
        name: "music",
        triggers: &[
            "music", "song", "listening", "spotify", "album", "artist", "playlist", "beat",
        ],
        responses: &[
            "ooh what song",
            "drop the playlist",
            "music hits different",
            "whats ur fav artist",
            "banger?",
        ],
    },
    Category {
        name: "food",
        triggers: &[
            "food", "eat", "eating", "hungry", "lunch", "dinner", "breakfast", "snack", "cooking",
        ],
        responses: &[
            "im hungry now thanks",
            "what u eating",
            "food pics or it didnt happen",
            "that sounds good ngl",
        ],
    },
    Category {
        name: "school",
        triggers: &[
            "school",
            "homework",
            "class",
            "teacher",
            "test",
            "exam",
            "studying",
            "assignment",
        ],
        responses: &[
            "school is pain",
            "rip",
            "good luck with that",
            "homework can wait",
            "felt that",
        ],
    },
    Category {
        name: "work",
        triggers: &["work", "job", "boss", "coworker", "shift", "working"],
        responses: &[
            "work grind",
            "get that bread",
            "adulting moment",
            "sounds rough",
            "at least u getting paid",
        ],
    },
    Category {
        name: "love",
        triggers: &[
            "crush",
            "boyfriend",
            "girlfriend",
            "dating",
            "relationship",
            "love",
            "like someone",
        ],
        responses: &[
            "ooh spill the tea",
            "love that for u",
            "thats cute ngl",
            "relationship goals",
            "tell me more",
        ],
    },
    Category {
        name: "questions",
        triggers: &[
            "do you",
            "are you",
            "can you",
            "will you",
            "would you",
            "have you",
            "what do you think",
        ],
        responses: &[
            "hmm good question",
            "honestly idk lol",
            "maybe?",
            "depends tbh",
            "what do u think",
        ],
    },
];

/// Replies used when neither a trigger nor the topic matches.
pub const FALLBACK_RESPONSES: &[&str] = &[
    "lol",
    "nice",
    "oh word",
    "thats cool",
    "fr",
    "interesting",
    "tell me more",
    "wait really",
    "no way",
    "hmm",
    "true true",
];

/// Topic keyword → category name, checked in order.
const TOPIC_KEYWORDS: &[(&str, &str)] = &[("game", "gaming"), ("music", "music"), ("food", "food")];

/// Looks up a category by name.
#[must_use]
pub fn category(name: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.name == name)
}

/// Decides which reply pool a message draws from. Never fails, for any input.
#[must_use]
pub fn classify(text: &str, topic: Option<&str>) -> Selection {
    let normalized = text.trim().to_lowercase();

    for category in CATEGORIES {
        if category
            .triggers
            .iter()
            .any(|trigger| normalized == *trigger || normalized.contains(trigger))
        {
            return Selection::Trigger(category);
        }
    }

    if let Some(topic) = topic {
        let topic = topic.to_lowercase();
        if let Some(category) = TOPIC_KEYWORDS
            .iter()
            .find(|(keyword, _)| topic.contains(keyword))
            .and_then(|(_, name)| category(name))
        {
            return Selection::Topic(category);
        }
    }

    Selection::Fallback
}

/// Produces a casual reply to `text`, using `rng` to pick within the selected pool.
pub fn respond<R: Rng + ?Sized>(text: &str, topic: Option<&str>, rng: &mut R) -> &'static str {
    let pool = match classify(text, topic) {
        Selection::Trigger(category) | Selection::Topic(category) => category.responses,
        Selection::Fallback => FALLBACK_RESPONSES,
    };
    pool.choose(rng).copied().unwrap_or("hmm")
}
