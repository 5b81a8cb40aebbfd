mod keystrokes;

pub use keystrokes::EnigoKeystrokes;
