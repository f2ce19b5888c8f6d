/// The sequence counterpart of [`DirtyMap`](super::DirtyMap): adds and
/// removals are recorded into a lazily allocated change list.
#[derive(Debug, Clone)]
pub struct DirtyList<T> {
    data: Vec<T>,
    changes: Option<Vec<T>>,
}

impl<T: Clone> DirtyList<T> {
    pub fn new() -> Self {
        DirtyList {
            data: Vec::new(),
            changes: None,
        }
    }

    /// Wrap existing elements without marking them as changes.
    pub fn from_data(data: Vec<T>) -> Self {
        DirtyList {
            data,
            changes: None,
        }
    }

    pub fn push(&mut self, element: T) {
        self.data.push(element.clone());
        self.track(element);
    }

    pub fn insert(&mut self, index: usize, element: T) {
        self.data.insert(index, element.clone());
        self.track(element);
    }

    pub fn extend<I>(&mut self, elements: I)
    where
        I: IntoIterator<Item = T>,
    {
        for element in elements {
            self.push(element);
        }
    }

    pub fn remove_at(&mut self, index: usize) -> T {
        let element = self.data.remove(index);
        self.track(element.clone());
        element
    }

    /// Remove and clear tracking, matching the map-side `clear_changes`
    /// behavior of a full reset.
    pub fn clear(&mut self) {
        self.data.clear();
        self.changes = None;
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn changes(&self) -> Vec<T> {
        self.changes.clone().unwrap_or_default()
    }

    pub fn has_changes(&self) -> bool {
        self.changes.as_ref().is_some_and(|c| !c.is_empty())
    }

    pub fn clear_changes(&mut self) {
        self.changes = None;
    }

    fn track(&mut self, element: T) {
        self.changes.get_or_insert_with(Vec::new).push(element);
    }
}

impl<T: Clone + PartialEq> DirtyList<T> {
    /// Remove the first occurrence of `element`, recording it when found.
    pub fn remove(&mut self, element: &T) -> bool {
        match self.data.iter().position(|e| e == element) {
            Some(index) => {
                self.remove_at(index);
                true
            }
            None => false,
        }
    }

    /// Keep only elements matching the predicate; removed elements are
    /// recorded as changes.
    pub fn retain<F>(&mut self, predicate: F)
    where
        F: Fn(&T) -> bool,
    {
        let mut removed = Vec::new();
        self.data.retain(|e| {
            let keep = predicate(e);
            if !keep {
                removed.push(e.clone());
            }
            keep
        });
        for element in removed {
            self.track(element);
        }
    }
}

impl<T: Clone> Default for DirtyList<T> {
    fn default() -> Self {
        DirtyList::new()
    }
}

impl<T: PartialEq> PartialEq for DirtyList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T: Clone> FromIterator<T> for DirtyList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        DirtyList::from_data(iter.into_iter().collect())
    }
}
