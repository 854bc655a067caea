//! Built-in programming jokes

use rand::seq::SliceRandom;

use super::JokeSource;

const JOKES: &[&str] = &[
    "There are 10 kinds of people in the world: those who understand binary and those who don't.",
    "Why do programmers prefer dark mode? Because light attracts bugs.",
    "A SQL query walks into a bar, walks up to two tables and asks: can I join you?",
    "How many programmers does it take to change a light bulb? None, that's a hardware problem.",
    "I would tell you a UDP joke, but you might not get it.",
    "Why did the developer go broke? Because he used up all his cache.",
    "Debugging is like being the detective in a crime movie where you are also the murderer.",
    "The best thing about a boolean is that even if you are wrong, you are only off by a bit.",
    "Why do Java developers wear glasses? Because they don't C sharp.",
    "Knock knock. Race condition. Who's there?",
    "There are only two hard things in computer science: cache invalidation, naming things, and off-by-one errors.",
    "A programmer's partner says: go to the store and buy a loaf of bread, and if they have eggs, buy a dozen. The programmer comes home with twelve loaves.",
];

/// Picks a random joke from a fixed list
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinJokes;

impl JokeSource for BuiltinJokes {
    fn random(&self) -> String {
        JOKES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or_default()
            .to_string()
    }
}
