use super::{Answer, Category, Question};

const CAT: Category = Category::new("cat");
const DOG: Category = Category::new("dog");
const FOX: Category = Category::new("fox");
const HAMSTER: Category = Category::new("hamster");
const HORSE: Category = Category::new("horse");

pub const QUESTIONS: &[Question] = &[
    Question::new(
        "What is your favorite activity?",
        &[
            Answer::new("Chasing mice", CAT),
            Answer::new("Playing fetch", DOG),
            Answer::new("Hunting in the forest", FOX),
            Answer::new("Running in a cage", HAMSTER),
            Answer::new("Racing on a track", HORSE),
        ],
    ),
    Question::new(
        "How do you prefer to travel?",
        &[
            Answer::new("On a quiet path", CAT),
            Answer::new("With a loyal friend", DOG),
            Answer::new("Through the woods", FOX),
            Answer::new("In a small space", HAMSTER),
            Answer::new("Across wide fields", HORSE),
        ],
    ),
    Question::new(
        "What is your personality like?",
        &[
            Answer::new("Independent", CAT),
            Answer::new("Friendly", DOG),
            Answer::new("Clever", FOX),
            Answer::new("Energetic", HAMSTER),
            Answer::new("Strong", HORSE),
        ],
    ),
    Question::new(
        "What kind of environment do you thrive in?",
        &[
            Answer::new("Quiet home", CAT),
            Answer::new("Open yard", DOG),
            Answer::new("Dense forest", FOX),
            Answer::new("Small enclosure", HAMSTER),
            Answer::new("Wide pasture", HORSE),
        ],
    ),
    Question::new(
        "What is your favorite food?",
        &[
            Answer::new("Fish", CAT),
            Answer::new("Bones", DOG),
            Answer::new("Insects", FOX),
            Answer::new("Seeds", HAMSTER),
            Answer::new("Grass", HORSE),
        ],
    ),
];
