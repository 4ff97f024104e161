use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

/// Which candidate list an operation works on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Food,
    Drink,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Drink => "drink",
        }
    }

    /// Name of both the bundled template and the backing file
    pub fn file_name(self) -> &'static str {
        match self {
            Category::Food => "food.txt",
            Category::Drink => "drink.txt",
        }
    }

    /// How the category is called in replies
    pub fn label(self) -> &'static str {
        match self {
            Category::Food => "美食",
            Category::Drink => "饮品",
        }
    }
}

pub type CandidateList = Vec<String>;

pub const DEFAULT_FOOD: &[&str] = &[
    "火锅", "烤肉", "寿司", "麻辣烫", "炸鸡", "螺蛳粉", "牛肉面", "披萨", "饺子", "汉堡", "盖浇饭",
    "酸菜鱼",
];

pub const DEFAULT_DRINK: &[&str] = &[
    "奶茶", "咖啡", "可乐", "果汁", "柠檬水", "气泡水", "茶", "酸奶", "椰汁", "奶昔", "果茶", "苏打水",
];

pub fn to_list(entries: &[&str]) -> CandidateList {
    entries.iter().map(|s| (*s).to_owned()).collect()
}

/// Lists used when a backing file is absent or can't be read
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultSet {
    food: CandidateList,
    drink: CandidateList,
}

impl DefaultSet {
    pub fn new(food: CandidateList, drink: CandidateList) -> DefaultSet {
        DefaultSet { food, drink }
    }

    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::Food => &self.food,
            Category::Drink => &self.drink,
        }
    }
}

impl Default for DefaultSet {
    fn default() -> DefaultSet {
        DefaultSet::new(to_list(DEFAULT_FOOD), to_list(DEFAULT_DRINK))
    }
}

quick_error! {
    #[derive(Debug)]
    pub enum StoreError {
        TemplateMissing(path: PathBuf) {
            display("template {} does not exist", path.display())
        }
        FileRead(path: PathBuf, err: io::Error) {
            display("couldn't read {}: {}", path.display(), err)
            cause(err)
        }
        Seed(path: PathBuf, err: io::Error) {
            display("couldn't seed {}: {}", path.display(), err)
            cause(err)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The template was copied into the data directory
    Seeded,
    /// A backing file was already there and has been left alone
    AlreadyPresent,
}

/// Splits the contents of a list file into entries.
///
/// Every line is trimmed and blank lines are dropped; the order of the
/// remaining lines is kept. A leading byte order mark is ignored.
pub fn parse_lines(text: &str) -> CandidateList {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Owns the backing files of the food and drink lists.
///
/// Backing files live in `data_dir` and are seeded once from the templates in
/// `template_dir`. After seeding they belong to the user: this type only ever
/// reads them.
#[derive(Clone, Debug)]
pub struct ListStore {
    data_dir: PathBuf,
    template_dir: PathBuf,
    defaults: DefaultSet,
}

impl ListStore {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(
        data_dir: P,
        template_dir: Q,
        defaults: DefaultSet,
    ) -> ListStore {
        ListStore {
            data_dir: data_dir.as_ref().to_path_buf(),
            template_dir: template_dir.as_ref().to_path_buf(),
            defaults,
        }
    }

    pub fn backing_path(&self, category: Category) -> PathBuf {
        self.data_dir.join(category.file_name())
    }

    pub fn template_path(&self, category: Category) -> PathBuf {
        self.template_dir.join(category.file_name())
    }

    /// Copies the template of `category` into the data directory unless a
    /// backing file already exists.
    pub fn try_seed(&self, category: Category) -> Result<SeedOutcome, StoreError> {
        let target = self.backing_path(category);
        if target.exists() {
            return Ok(SeedOutcome::AlreadyPresent);
        }

        let template = self.template_path(category);
        let mut src = match File::open(&template) {
            Ok(file) => file,
            Err(ref err) if err.kind() == ErrorKind::NotFound => {
                return Err(StoreError::TemplateMissing(template));
            }
            Err(err) => return Err(StoreError::Seed(template, err)),
        };

        fs::create_dir_all(&self.data_dir)
            .map_err(|err| StoreError::Seed(self.data_dir.clone(), err))?;

        // create_new: never clobber a file that appeared since the check above
        let mut dst = match OpenOptions::new().write(true).create_new(true).open(&target) {
            Ok(file) => file,
            Err(ref err) if err.kind() == ErrorKind::AlreadyExists => {
                return Ok(SeedOutcome::AlreadyPresent);
            }
            Err(err) => return Err(StoreError::Seed(target, err)),
        };

        if let Err(err) = io::copy(&mut src, &mut dst) {
            drop(dst);
            let _ = fs::remove_file(&target);
            return Err(StoreError::Seed(target, err));
        }
        Ok(SeedOutcome::Seeded)
    }

    /// Seeds the backing file of `category`, logging instead of failing.
    pub fn ensure_seeded(&self, category: Category) {
        match self.try_seed(category) {
            Ok(SeedOutcome::Seeded) => info!(
                "seeded {} from {}",
                self.backing_path(category).display(),
                self.template_path(category).display()
            ),
            Ok(SeedOutcome::AlreadyPresent) => debug!(
                "{} already exists, not seeding",
                self.backing_path(category).display()
            ),
            Err(err @ StoreError::TemplateMissing(_)) => {
                warn!("{}, skipping {} list seeding", err, category.name())
            }
            Err(err) => error!("{}", err),
        }
    }

    /// Reads the backing file of `category`.
    ///
    /// Returns `Ok(None)` when the file doesn't exist. A file that exists but
    /// contains no entries gives `Ok(Some(vec![]))`.
    pub fn try_load(&self, category: Category) -> Result<Option<CandidateList>, StoreError> {
        let path = self.backing_path(category);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(ref err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::FileRead(path, err)),
        };
        let text = String::from_utf8(bytes).map_err(|err| {
            StoreError::FileRead(path.clone(), io::Error::new(ErrorKind::InvalidData, err))
        })?;
        Ok(Some(parse_lines(&text)))
    }

    /// Loads the list of `category`, falling back to the defaults when the
    /// backing file is absent or unreadable.
    pub fn load(&self, category: Category) -> CandidateList {
        match self.try_load(category) {
            Ok(Some(list)) => {
                if list.is_empty() {
                    warn!(
                        "{} has no entries, {} suggestions are disabled",
                        self.backing_path(category).display(),
                        category.name()
                    );
                } else {
                    info!(
                        "loaded {} {} entries from {}",
                        list.len(),
                        category.name(),
                        self.backing_path(category).display()
                    );
                }
                list
            }
            Ok(None) => {
                warn!(
                    "{} not found, using the built-in {} list",
                    self.backing_path(category).display(),
                    category.name()
                );
                self.defaults.get(category).to_vec()
            }
            Err(err) => {
                error!("{}, using the built-in {} list", err, category.name());
                self.defaults.get(category).to_vec()
            }
        }
    }

    pub fn seed_and_load(&self, category: Category) -> CandidateList {
        self.ensure_seeded(category);
        self.load(category)
    }
}
