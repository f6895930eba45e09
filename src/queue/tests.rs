use super::BlockingQueue;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_queue_new_is_empty() {
    let queue: BlockingQueue<String> = BlockingQueue::new();
    assert!(queue.is_empty());
    assert_eq!(queue.len(), 0);
    assert!(queue.try_pop().is_none());
}

#[test]
fn test_push_pop_fifo() {
    let queue = BlockingQueue::new();
    for i in 0..5 {
        queue.push(i);
    }
    assert_eq!(queue.len(), 5);
    let popped: Vec<i32> = (0..5).map(|_| queue.pop()).collect();
    assert_eq!(popped, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_size_returns_to_zero() {
    let queue = BlockingQueue::new();
    for i in 0..100 {
        queue.push(i);
    }
    for _ in 0..100 {
        queue.pop();
    }
    assert_eq!(queue.len(), 0);
    assert!(queue.is_empty());
    assert!(queue.try_pop().is_none());

    // Reusable after being emptied.
    queue.push(7);
    assert_eq!(queue.pop(), 7);
}

#[test]
fn test_pop_blocks_until_push() {
    let queue = Arc::new(BlockingQueue::new());
    let returned = Arc::new(AtomicBool::new(false));

    let consumer = {
        let queue = queue.clone();
        let returned = returned.clone();
        thread::spawn(move || {
            let start = Instant::now();
            let item: String = queue.pop();
            returned.store(true, Ordering::SeqCst);
            (item, start.elapsed())
        })
    };

    let delay = Duration::from_millis(200);
    thread::sleep(delay);
    assert!(!returned.load(Ordering::SeqCst), "pop returned before push");

    queue.push("late".to_string());
    let (item, waited) = consumer.join().unwrap();
    assert_eq!(item, "late");
    assert!(waited >= delay - Duration::from_millis(20));
}

#[test]
fn test_consumer_started_mid_stream_sees_all_in_order() {
    let queue = Arc::new(BlockingQueue::new());
    let (started_tx, started_rx) = std::sync::mpsc::channel();

    let producer = {
        let queue = queue.clone();
        thread::spawn(move || {
            for i in 0..10 {
                queue.push(i.to_string());
                if i == 3 {
                    started_tx.send(()).unwrap();
                }
                thread::sleep(Duration::from_millis(5));
            }
        })
    };

    started_rx.recv().unwrap();
    let consumer = {
        let queue = queue.clone();
        thread::spawn(move || (0..10).map(|_| queue.pop()).collect::<Vec<String>>())
    };

    producer.join().unwrap();
    let seen = consumer.join().unwrap();
    let expected: Vec<String> = (0..10).map(|i| i.to_string()).collect();
    assert_eq!(seen, expected);
    assert!(queue.is_empty());
}

#[test]
fn test_per_producer_order_with_many_producers() {
    let queue = Arc::new(BlockingQueue::new());
    let producers: Vec<_> = (0..4)
        .map(|p| {
            let queue = queue.clone();
            thread::spawn(move || {
                for i in 0..250 {
                    queue.push((p, i));
                }
            })
        })
        .collect();

    let mut last = [-1i32; 4];
    for _ in 0..1000 {
        let (p, i) = queue.pop();
        assert!(i > last[p], "producer {} out of order", p);
        last[p] = i;
    }
    for producer in producers {
        producer.join().unwrap();
    }
    assert_eq!(last, [249; 4]);
    assert!(queue.is_empty());
}

#[test]
fn test_items_are_never_duplicated_across_consumers() {
    let queue = Arc::new(BlockingQueue::new());
    for i in 0..400 {
        queue.push(i);
    }

    let consumers: Vec<_> = (0..4)
        .map(|_| {
            let queue = queue.clone();
            thread::spawn(move || (0..100).map(|_| queue.pop()).collect::<Vec<i32>>())
        })
        .collect();

    let mut all: Vec<i32> = consumers
        .into_iter()
        .flat_map(|c| c.join().unwrap())
        .collect();
    all.sort_unstable();
    assert_eq!(all, (0..400).collect::<Vec<_>>());
}

#[test]
fn test_pop_timeout_expires_on_empty_queue() {
    let queue: BlockingQueue<u8> = BlockingQueue::new();
    let start = Instant::now();
    assert!(queue.pop_timeout(Duration::from_millis(50)).is_none());
    assert!(start.elapsed() >= Duration::from_millis(45));
}

#[test]
fn test_pop_timeout_returns_pushed_item() {
    let queue = Arc::new(BlockingQueue::new());
    let pusher = {
        let queue = queue.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            queue.push(42u32);
        })
    };
    assert_eq!(queue.pop_timeout(Duration::from_secs(5)), Some(42));
    pusher.join().unwrap();
}

#[test]
fn test_drain_releases_in_fifo_order() {
    let queue = BlockingQueue::new();
    queue.push("a");
    queue.push("b");
    queue.push("c");
    assert_eq!(queue.drain(), vec!["a", "b", "c"]);
    assert!(queue.is_empty());
}
